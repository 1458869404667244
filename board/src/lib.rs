//! Board viewer engine for the grid game client.
//!
//! Reconciles server-pushed board updates (board dimensions, entity and
//! player deltas) against local state and keeps a drawing surface in sync.
//! The engine is generic over [`surface::Surface`], so the same code drives
//! the browser canvas (compiled to WebAssembly) and the headless retained
//! [`scene::Scene`] used by the CLI and tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Reconciliation engine: entity/player deltas, geometry, drawables |
//! | [`session`] | Per-connection context: engine, outbound [`session::Link`], selection, resize settle |
//! | [`geometry`] | Grid geometry, pixel ↔ cell conversion, entity insets |
//! | [`store`] | Entity map and cell index |
//! | [`roster`] | Player roster and ordinals |
//! | [`hit`] | Pointer hit-testing against occupied cells |
//! | [`selection`] | Local select/deselect toggling |
//! | [`input`] | Mouse/touch normalization to one point |
//! | [`settle`] | Resize debouncing with an injected clock |
//! | [`surface`] | Drawing surface trait and primitives |
//! | [`scene`] | Retained in-memory surface |
//! | [`render`] | Canvas 2D surface |
//! | [`web`] | Browser bootstrap (`runApp`) |
//! | [`consts`] | Layout, styling and timing constants |

pub mod consts;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod roster;
pub mod scene;
pub mod selection;
pub mod session;
pub mod settle;
pub mod store;
pub mod surface;
pub mod web;
