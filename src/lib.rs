//! Trout - behavioral trace toolkit for dynamic malware analysis
//!
//! This library compares behavioral traces (ordered API/method call
//! sequences captured from running software) and synthesizes labeled
//! malicious samples by injecting known behaviors into benign traces.

pub mod behavior;
pub mod cli;
pub mod config;
pub mod features;
pub mod json_output;
pub mod sequence;
pub mod trace;
