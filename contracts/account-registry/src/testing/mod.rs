mod suite;
mod unit;
