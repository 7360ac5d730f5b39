// src/strategies/mod.rs

// La tâche configurée et le moteur qui l'exécute, un cycle à la fois.
pub mod task;
pub mod token_swapper;

pub use task::{load_tasks_file, Side, SwapTask, SwapTaskParams, TransferRule};
pub use token_swapper::{BlockReason, CycleError, CycleReport, CycleResult, TokenSwapper};
