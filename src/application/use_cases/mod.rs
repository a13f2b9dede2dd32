pub mod clone_repositories;

pub use clone_repositories::{
    CloneEvent, CloneReporter, CloneRepositoriesConfig, CloneRepositoriesUseCase,
};
