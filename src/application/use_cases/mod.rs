pub mod batch_operation;
pub mod directory_operation;

pub use batch_operation::{
    BatchObserver, BatchOperationConfig, BatchOperationUseCase, BatchSummary, NoopObserver,
    OperationResult, OperationStatus,
};
pub use directory_operation::{
    DirectoryOperation, DirectoryOperationError, OperationKind, OperationSettings,
    PlannedOperation,
};
