pub mod native_wrap;   // Compte WSOL temporaire (create → init → swap → close).
pub mod sender;        // Signature, envoi et confirmation.
pub mod swap_builder;  // Liste d'instructions du swap Raydium.
pub mod transfer;

pub use sender::{ConfirmationPolicy, TransactionExecutor};
pub use swap_builder::{build_swap, SwapLeg, SwapPlan};
