// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU rendering toolkit for a voxel game engine, built on wgpu.
//!
//! Voxen packages the GPU plumbing a blocky-world renderer needs:
//! face-mesh staging and buffer upload, composable WGSL shaders, texture
//! atlas loading, storage-buffer compute jobs with readback, and the
//! small utilities that sit around a render loop (frame timing, bitmap
//! text wrapping, RNG).
//!
//! # Key entry points
//!
//! - [`gpu::render_context::RenderContext`] - device, queue, and surface
//!   acquisition
//! - [`gpu::face_buffer`] - CPU face staging and GPU vertex/index upload
//! - [`gpu::shader_composer::ShaderComposer`] - WGSL composition with
//!   shared modules
//! - [`gpu::compute::ComputeJob`] - compute dispatch and two-phase
//!   readback
//! - [`renderer::chunk::ChunkRenderer`] - textured face-mesh draw pass
//! - [`options::Options`] - runtime configuration (display, world,
//!   atlas)
//!
//! # Architecture
//!
//! The `gpu` module is windowing-agnostic: everything below
//! [`renderer`] works against a bare device/queue pair, so headless
//! tools and tests run the same code path the viewer does. The optional
//! `viewer` feature pulls in winit and provides the demo binary.

pub mod assets;
pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod text;
pub mod util;
