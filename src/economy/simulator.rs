//! Balance simulator for Streamer Clicker.
//! Run with: cargo test simulate_greedy -- --nocapture
