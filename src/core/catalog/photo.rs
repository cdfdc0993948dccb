// Locally captured photo awaiting confirmation by the remote catalog.
//
// One pending photo per station: a later capture for the same station
// replaces the earlier one.
//
// Timestamps
// - captured_at uses the same epoch unit as everything else (milliseconds).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPhoto {
    pub station_id: i64,
    pub bytes: Vec<u8>,
    pub captured_at: i64,
}
