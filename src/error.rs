//! Error types for routing and allocation calls.
//!
//! Data-quality problems (a malformed road row, an unknown stop id, a
//! too-short route) are absorbed during construction and never surface
//! here; they are logged and the offending record is skipped. Likewise a
//! disconnected source/destination on the road network is a valid
//! "no route" outcome returned as `None`, not an error. The variants
//! below cover the failures a caller must handle: bad input ids, empty
//! required tables, unreachable transit stops, and infeasible
//! allocation requests.

/// Errors raised to the caller by the routing and allocation entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitError {
    /// A location id passed by the caller is not a node of the graph in use.
    #[error("unknown location id: {0}")]
    LocationNotFound(String),

    /// Source and destination stops lie in different connected components
    /// of the transit network.
    #[error("no transit route between {origin} and {dest}: {reason}")]
    NoRouteAvailable {
        /// Requested origin stop id.
        origin: String,
        /// Requested destination stop id.
        dest: String,
        /// Which endpoint is unreachable, when determinable.
        reason: String,
    },

    /// A table required by the operation contains no records.
    #[error("required table is empty: {0}")]
    EmptyTable(&'static str),

    /// The requested unit pool cannot satisfy the per-route bounds.
    #[error("allocation infeasible: {0}")]
    AllocationInfeasible(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransitError::LocationNotFound("N99".into());
        assert_eq!(err.to_string(), "unknown location id: N99");

        let err = TransitError::NoRouteAvailable {
            origin: "1".into(),
            dest: "9".into(),
            reason: "stop 9 is not connected to any other stop".into(),
        };
        assert_eq!(
            err.to_string(),
            "no transit route between 1 and 9: stop 9 is not connected to any other stop"
        );

        let err = TransitError::EmptyTable("bus_routes");
        assert_eq!(err.to_string(), "required table is empty: bus_routes");

        let err = TransitError::AllocationInfeasible(
            "3 routes require at least 15 units but only 10 are available".into(),
        );
        assert_eq!(
            err.to_string(),
            "allocation infeasible: 3 routes require at least 15 units but only 10 are available"
        );
    }
}
