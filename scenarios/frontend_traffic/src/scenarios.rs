use load_generator_runner::prelude::{RequestSpec, Scenario};
use rand::Rng;

/// Highest score a simulated player submits.
const MAX_SCORE: u32 = 1500;

/// The user actions simulated against the demo frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontendScenario {
    SessionCheck,
    RankingsTop,
    RankingsTopLimit,
    ScoreSubmit,
    Logout,
}

impl FrontendScenario {
    pub const ALL: [FrontendScenario; 5] = [
        FrontendScenario::SessionCheck,
        FrontendScenario::RankingsTop,
        FrontendScenario::RankingsTopLimit,
        FrontendScenario::ScoreSubmit,
        FrontendScenario::Logout,
    ];
}

impl Scenario for FrontendScenario {
    fn name(&self) -> &'static str {
        match self {
            FrontendScenario::SessionCheck => "session_check",
            FrontendScenario::RankingsTop => "rankings_top",
            FrontendScenario::RankingsTopLimit => "rankings_top_limit",
            FrontendScenario::ScoreSubmit => "score_submit",
            FrontendScenario::Logout => "logout",
        }
    }

    fn request(&self) -> RequestSpec {
        match self {
            FrontendScenario::SessionCheck => session_check(),
            FrontendScenario::RankingsTop => rankings_top(),
            FrontendScenario::RankingsTopLimit => rankings_top_limit(),
            FrontendScenario::ScoreSubmit => score_submit(),
            FrontendScenario::Logout => logout(),
        }
    }

    fn ends_session(&self) -> bool {
        matches!(self, FrontendScenario::Logout)
    }
}

fn session_check() -> RequestSpec {
    RequestSpec::get("/api/session/me").expect_status(200)
}

fn rankings_top() -> RequestSpec {
    RequestSpec::get("/rankings/top").expect_status(200)
}

fn rankings_top_limit() -> RequestSpec {
    RequestSpec::get("/rankings/top?limit=5").expect_status(200)
}

fn score_submit() -> RequestSpec {
    let score = rand::thread_rng().gen_range(0..=MAX_SCORE);
    RequestSpec::post("/api/score")
        .with_json(serde_json::json!({ "score": score }))
        .expect_status(200)
}

// The frontend serves logout as a GET.
fn logout() -> RequestSpec {
    RequestSpec::get("/api/auth/logout").expect_status(200)
}

/// Log in as the demo user.
pub fn login() -> RequestSpec {
    RequestSpec::post("/api/auth/login")
        .with_json(serde_json::json!({ "id": "demo", "pw": "demo" }))
        .expect_status(200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_generator_runner::prelude::Method;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names = FrontendScenario::ALL
            .iter()
            .map(|s| s.name())
            .collect::<HashSet<_>>();
        assert_eq!(FrontendScenario::ALL.len(), names.len());
    }

    #[test]
    fn only_logout_ends_session() {
        let ending = FrontendScenario::ALL
            .iter()
            .filter(|s| s.ends_session())
            .collect::<Vec<_>>();
        assert_eq!(vec![&FrontendScenario::Logout], ending);
    }

    #[test]
    fn requests_match_frontend_routes() {
        let routes = FrontendScenario::ALL
            .iter()
            .map(|s| {
                let spec = s.request();
                (spec.method, spec.path)
            })
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                (Method::GET, "/api/session/me".to_string()),
                (Method::GET, "/rankings/top".to_string()),
                (Method::GET, "/rankings/top?limit=5".to_string()),
                (Method::POST, "/api/score".to_string()),
                (Method::GET, "/api/auth/logout".to_string()),
            ],
            routes
        );
    }

    #[test]
    fn score_submit_sends_score_in_range() {
        for _ in 0..50 {
            let body = FrontendScenario::ScoreSubmit
                .request()
                .body
                .expect("Score submission must carry a body");
            let score = body["score"].as_u64().expect("Score must be a number");
            assert!(score <= MAX_SCORE as u64);
        }
    }

    #[test]
    fn login_uses_demo_credentials() {
        let spec = login();
        assert_eq!(Method::POST, spec.method);
        assert_eq!("/api/auth/login", spec.path);
        assert_eq!(
            Some(serde_json::json!({ "id": "demo", "pw": "demo" })),
            spec.body
        );
    }
}
