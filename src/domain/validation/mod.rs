pub mod trade_input;
