//! Error taxonomy for the marketplace core
//!
//! Every precondition violation is a distinct, named error. The core never
//! retries; errors propagate to the access layer, which maps them onto
//! user-facing statuses via [`ErrorKind`].

use thiserror::Error;

/// Top-level marketplace error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Item error: {0}")]
    Item(#[from] ItemError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Rating error: {0}")]
    Rating(#[from] RatingError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Item-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError {
    #[error("Item not found: {item_id}")]
    NotFound { item_id: String },

    #[error("Item {item_id} is not available (status {status})")]
    NotAvailable { item_id: String, status: String },

    #[error("User does not own item {item_id}")]
    NotOwner { item_id: String },

    #[error("Item {item_id} has {count} pending trade request(s)")]
    PendingRequestsExist { item_id: String, count: usize },

    #[error("Item {item_id} cannot change visibility while {status}")]
    VisibilityLocked { item_id: String, status: String },
}

/// Trade-request-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Trade request not found: {request_id}")]
    NotFound { request_id: String },

    #[error("Trade request {request_id} is not pending (status {status})")]
    NotPending { request_id: String, status: String },

    #[error("Requested and offered item must differ")]
    SameItem,

    #[error("Offered item {item_id} does not belong to the requester")]
    OfferedNotOwned { item_id: String },

    #[error("Cannot request your own item {item_id}")]
    RequestedOwnItem { item_id: String },

    #[error("An identical pending trade request already exists")]
    DuplicatePending,

    #[error("Only the requested item's owner may decide request {request_id}")]
    NotRequestedOwner { request_id: String },
}

/// Trade-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Trade not found: {trade_id}")]
    NotFound { trade_id: String },

    #[error("User is not a participant of trade {trade_id}")]
    NotParticipant { trade_id: String },

    #[error("Trade {trade_id} is already completed")]
    AlreadyCompleted { trade_id: String },

    #[error("Trade {trade_id} is already cancelled")]
    AlreadyCancelled { trade_id: String },
}

/// Rating-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    #[error("Rating not found: {rating_id}")]
    NotFound { rating_id: String },

    #[error("Users cannot rate themselves")]
    SelfRating,

    #[error("Reviewer is not a participant of trade {trade_id}")]
    ReviewerNotParticipant { trade_id: String },

    #[error("Reviewee is not the reviewer's counterparty in trade {trade_id}")]
    RevieweeNotCounterparty { trade_id: String },

    #[error("Trade {trade_id} is not completed; rating is not yet eligible")]
    TradeNotCompleted { trade_id: String },

    #[error("A rating for this (reviewer, reviewee, trade) already exists")]
    Duplicate,

    #[error("Only the rating's author may modify it")]
    NotAuthor,
}

/// Persistence-layer errors, surfaced unmodified as a generic failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Coarse classification used by the access layer for status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity missing
    NotFound,
    /// Actor lacks rights over the entity
    Forbidden,
    /// Entity not in the required status, or a uniqueness violation
    Conflict,
    /// Unexpected persistence failure
    Internal,
}

impl MarketError {
    /// Classify this error for user-facing status mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Item(e) => match e {
                ItemError::NotFound { .. } => ErrorKind::NotFound,
                ItemError::NotOwner { .. } => ErrorKind::Forbidden,
                ItemError::NotAvailable { .. }
                | ItemError::PendingRequestsExist { .. }
                | ItemError::VisibilityLocked { .. } => ErrorKind::Conflict,
            },
            MarketError::Request(e) => match e {
                RequestError::NotFound { .. } => ErrorKind::NotFound,
                RequestError::NotRequestedOwner { .. } => ErrorKind::Forbidden,
                RequestError::NotPending { .. }
                | RequestError::SameItem
                | RequestError::OfferedNotOwned { .. }
                | RequestError::RequestedOwnItem { .. }
                | RequestError::DuplicatePending => ErrorKind::Conflict,
            },
            MarketError::Trade(e) => match e {
                TradeError::NotFound { .. } => ErrorKind::NotFound,
                TradeError::NotParticipant { .. } => ErrorKind::Forbidden,
                TradeError::AlreadyCompleted { .. } | TradeError::AlreadyCancelled { .. } => {
                    ErrorKind::Conflict
                }
            },
            MarketError::Rating(e) => match e {
                RatingError::NotFound { .. } => ErrorKind::NotFound,
                RatingError::NotAuthor => ErrorKind::Forbidden,
                RatingError::SelfRating
                | RatingError::ReviewerNotParticipant { .. }
                | RatingError::RevieweeNotCounterparty { .. }
                | RatingError::TradeNotCompleted { .. }
                | RatingError::Duplicate => ErrorKind::Conflict,
            },
            MarketError::Store(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ItemError::NotAvailable {
            item_id: "abc".to_string(),
            status: "RESERVED".to_string(),
        };
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("RESERVED"));
    }

    #[test]
    fn test_market_error_from_sub_errors() {
        let err: MarketError = RequestError::SameItem.into();
        assert!(matches!(err, MarketError::Request(_)));
        let err: MarketError = TradeError::AlreadyCancelled {
            trade_id: "t".to_string(),
        }
        .into();
        assert!(matches!(err, MarketError::Trade(_)));
    }

    #[test]
    fn test_kind_classification() {
        let not_found: MarketError = ItemError::NotFound {
            item_id: "x".to_string(),
        }
        .into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let forbidden: MarketError = RatingError::NotAuthor.into();
        assert_eq!(forbidden.kind(), ErrorKind::Forbidden);

        let conflict: MarketError = RatingError::Duplicate.into();
        assert_eq!(conflict.kind(), ErrorKind::Conflict);

        let internal: MarketError = StoreError::Unavailable("down".to_string()).into();
        assert_eq!(internal.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_completed_and_cancelled_are_distinct() {
        let completed = TradeError::AlreadyCompleted {
            trade_id: "t".to_string(),
        };
        let cancelled = TradeError::AlreadyCancelled {
            trade_id: "t".to_string(),
        };
        assert_ne!(completed, cancelled);
    }
}
