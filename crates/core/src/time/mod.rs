pub mod th_market;
