// THEORY:
// This file is the main entry point for the `iris_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (a capture app, a
// preview window, a test harness).
//
// The primary goal is to export the `FramePipeline` and its associated data
// structures (`PipelineConfig`, `FrameArtifacts`, `TransformParameters`) as
// the clean, high-level interface for per-frame processing, and the
// `CaptureSession` runtime as the scheduling layer around it. The individual
// stage implementations (`core_modules`) stay reachable for callers that
// want a single transform without the orchestration.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod runtime;
