pub mod check_in_item_cmd;
pub mod check_out_item_cmd;
pub mod place_request_cmd;
pub mod renew_loan_cmd;
