use thiserror::Error;

use crate::core::ports::StoreError;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
