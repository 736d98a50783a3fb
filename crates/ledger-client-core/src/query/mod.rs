// Path: crates/ledger-client-core/src/query/mod.rs
//! Query encoders/decoders: one module per concrete Query/Response
//! variant, sharing the oneof-wrapping helpers in `common`.

mod account_info;
mod balance;
pub(crate) mod common;
mod receipt_record;
mod token;
mod topic_info;

pub use account_info::{
    decode_account_details_response, decode_account_info_response, encode_account_details_query,
    encode_account_info_query, AccountDetails, AccountInfo,
};
pub use balance::{decode_balance_response, encode_balance_query, AccountBalanceResponse, TokenBalance};
pub use common::QueryHeader;
pub use receipt_record::{decode_receipt_response, decode_record_response, encode_receipt_query, encode_record_query};
pub use token::{
    decode_token_allowances_response, decode_token_info_response, encode_token_allowances_query,
    encode_token_info_query, TokenAllowance, TokenInfo,
};
pub use topic_info::{
    decode_topic_info_response, decode_topic_message_frame, encode_topic_info_query,
    encode_topic_subscribe_query, TopicInfo,
};
