// Freshness marker for the locally stored station set.
//
// Purpose
// - Record when the last full station sync succeeded and whether one ever
//   completed at all. Written only by the station refresh flow, strictly
//   after the bulk write.
//
// Timestamps
// - last_update is epoch milliseconds; None until the first successful sync.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWatermark {
    pub last_update: Option<i64>,
    pub data_complete: bool,
}

impl SyncWatermark {
    pub fn completed(now_millis: i64) -> Self {
        Self {
            last_update: Some(now_millis),
            data_complete: true,
        }
    }
}
