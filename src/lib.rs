pub mod error;
pub mod group_stage;
pub mod knockout;
pub mod ranking;
pub mod score;
pub mod seeding;
pub mod tournament;
pub mod types;

pub use error::TournamentError;
pub use ranking::{RankCriterion, RankingComparator};
pub use score::{RankedScoreGenerator, ScoreGenerator, ScriptedScores};
pub use tournament::Tournament;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(error: TournamentError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// WASM-exposed tournament wrapper
#[wasm_bindgen]
pub struct TournamentEngine {
    tournament: Tournament,
}

#[wasm_bindgen]
impl TournamentEngine {
    /// Create a tournament with default config
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> TournamentEngine {
        TournamentEngine {
            tournament: Tournament::new(TournamentConfig::default(), seed),
        }
    }

    /// Create with custom config
    pub fn new_with_config(seed: u64, config_json: &str) -> Result<TournamentEngine, JsValue> {
        let config = parse_config(config_json).map_err(to_js)?;
        Ok(TournamentEngine {
            tournament: Tournament::new(config, seed),
        })
    }

    /// Create with a random seed; read it back with `get_seed`
    pub fn from_entropy() -> TournamentEngine {
        TournamentEngine {
            tournament: Tournament::from_entropy(TournamentConfig::default()),
        }
    }

    /// Simulate the tournament for a roster and return the result as JSON
    pub fn simulate(&self, roster_json: &str) -> Result<String, JsValue> {
        self.tournament.run_json(roster_json).map_err(to_js)
    }

    pub fn get_seed(&self) -> u64 {
        self.tournament.seed()
    }

    /// Get current config as JSON
    pub fn get_config(&self) -> String {
        serde_json::to_string(&self.tournament.config).unwrap_or_default()
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&TournamentConfig::default()).unwrap_or_default()
    }
}

/// Parse and validate a JSON tournament config
pub fn parse_config(config_json: &str) -> error::Result<TournamentConfig> {
    let config: TournamentConfig = serde_json::from_str(config_json)?;
    config.validate()?;
    Ok(config)
}

/// One-shot simulation with the default config
#[wasm_bindgen]
pub fn simulate_tournament(roster_json: &str, seed: u64) -> Result<String, JsValue> {
    Tournament::new(TournamentConfig::default(), seed)
        .run_json(roster_json)
        .map_err(to_js)
}
