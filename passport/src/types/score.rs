use serde::{Deserialize, Serialize};

/// Envelope returned by the score service: `{"data":{"totalScore":12.5}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreEnvelope {
    #[serde(default)]
    pub data: Option<ScoreData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    #[serde(default)]
    pub total_score: Option<f64>,
}

impl ScoreEnvelope {
    pub fn total_score(&self) -> Option<f64> {
        self.data.as_ref().and_then(|d| d.total_score)
    }
}
