pub mod apply_ctx;
pub mod dialog_flow;
pub mod form_resolver;
pub mod listing_scanner;
pub mod location_cursor;

pub use apply_ctx::{ApplyCtx, FlowSettings};
pub use dialog_flow::{DialogFlow, DialogOutcome, DialogState};
pub use form_resolver::{normalize_label, FormResolver, StepReport, StepResolver};
pub use listing_scanner::{ListingScanner, LocationOutcome, ScanStats};
pub use location_cursor::LocationCursor;
