pub mod status_ticker;
