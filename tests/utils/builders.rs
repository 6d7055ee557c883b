use scorebox::scoring::models::{ExtraType, WicketType};
use scorebox::scoring::types::RecordBallRequest;

/// Builder for delivery requests in workflow tests.
pub struct BallBuilder {
    request: RecordBallRequest,
}

impl BallBuilder {
    pub fn new(innings: u8, batsman_id: &str, bowler_id: &str) -> Self {
        Self {
            request: RecordBallRequest {
                innings,
                batsman_id: batsman_id.to_string(),
                bowler_id: bowler_id.to_string(),
                runs: 0,
                extras: 0,
                extra_type: None,
                wicket_type: None,
                wicket_player_id: None,
            },
        }
    }

    pub fn runs(mut self, runs: u32) -> Self {
        self.request.runs = runs;
        self
    }

    pub fn extras(mut self, extras: u32, extra_type: ExtraType) -> Self {
        self.request.extras = extras;
        self.request.extra_type = Some(extra_type);
        self
    }

    #[allow(dead_code)]
    pub fn wicket(mut self, wicket_type: WicketType, dismissed_id: &str) -> Self {
        self.request.wicket_type = Some(wicket_type);
        self.request.wicket_player_id = Some(dismissed_id.to_string());
        self
    }

    pub fn build(self) -> RecordBallRequest {
        self.request
    }
}
