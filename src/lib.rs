#![deny(missing_docs)]
//! Webex Teams hotdog detection bot
//!
//! Receives chat webhook events over HTTP, downloads the attached image,
//! asks Amazon Rekognition whether it shows a hot dog, and posts the verdict
//! back to the originating room. Each invocation is independent and
//! stateless; nothing outlives a single request.

/// Configuration management
pub mod config;
/// Webhook event payloads and reply-path selection
pub mod event;
/// Request-handling pipeline
pub mod handler;
/// Label detection via Amazon Rekognition
pub mod vision;
/// Webhook HTTP surface
pub mod web;
/// Webex Teams API client
pub mod webex;
