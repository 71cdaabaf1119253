//! On-chain операции: статусы, виды транзакций, Cadence, граница с кошельком и слежение.

pub mod cadence;
pub mod flow;
pub mod kind;
pub mod status;
pub mod tracker;
pub mod wallet;

pub use cadence::{BuyItemInput, CadenceValue, ContractAddresses, Script, TransactionBuilder, TransactionRequest};
pub use flow::FlowAccessNode;
pub use kind::TransactionKind;
pub use status::TransactionStatus;
pub use tracker::{TransactionRegistry, TransactionSnapshot, TransactionState, TransactionTracker};
pub use wallet::{ChainQuery, CurrentUser, TransactionResult, TransactionStatusSource, Wallet, WalletSdk};
