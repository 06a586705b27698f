//! # mw-gadgets
//!
//! A build orchestrator for MediaWiki gadgets. Gadgets are declared in a YAML
//! manifest and developed as ordinary source files; this crate decides which
//! of them to build, in which order, and writes a single entrypoint script
//! that registers each one with ResourceLoader under the same conditions the
//! Gadgets extension would apply.
//!
//! # Architecture: Five-Stage Pipeline
//!
//! ```text
//! 1. Select     manifest + src/   →  candidates      (workspace rules, filesystem checks)
//! 2. Schedule   candidates        →  layered order   (requires resolved pass by pass)
//! 3. Guard      conditions        →  JS wrappers     (rights, skins, ... , dependencies)
//! 4. Compile    unit + bundle     →  payload         (mw.loader.impl registration)
//! 5. Emit       payloads          →  load.js         (reference or self-contained)
//! ```
//!
//! Compiling JavaScript and stylesheets is not done here. An external bundler
//! (fed by [`inputs`]) compiles every declared file first; the inline payload
//! strategy reads its output back through [`bundle::BundleOutput`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`manifest`] | YAML manifest model and loading |
//! | [`select`] | Stage 1: workspace rules, duplicate ids, directory and file checks |
//! | [`schedule`] | Stage 2: layered dependency resolution |
//! | [`guard`] | Stage 3: conditional-loading wrappers |
//! | [`payload`] | Stage 4: inline and lazy `mw.loader.impl` registrations |
//! | [`emit`] | Stage 5: entrypoint and rolled-up bundle writers |
//! | [`project`] | Config + manifest + source tree, and the build operations on them |
//! | [`config`] | `mw-gadgets.toml` loading, merging, validation |
//! | [`source`] | Source tree layout and interface code discovery |
//! | [`bundle`] | Lookup of the bundler's compiled output |
//! | [`transform`] | Post-processing of generated code (esbuild, passthrough) |
//! | [`inputs`] | Bundler entries and i18n assets |
//! | [`definition`] | `MediaWiki:Gadgets-definition` wikitext |
//! | [`urls`] | Static file URLs on the dev/preview server |
//! | [`js`] | JavaScript literal escaping |
//! | [`naming`] | Code file classification and bundle keys |
//! | [`types`] | Shared types (`BuildUnit`, `Conditions`, `UnitId`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Nothing Fatal Per Gadget
//!
//! A gadget that is disabled, missing files, waiting on an absent
//! requirement or gone by the time it is compiled is left out and reported.
//! The rest still build. Only a broken transform, an unreadable manifest or
//! a failing output stream stop the build.
//!
//! ## Layered Scheduling
//!
//! Units are not sorted depth-first. Each pass takes every unit whose
//! requirements are already placed, keeping manifest order within the pass.
//! The result is stable under reordering of unrelated gadgets, and a stall
//! identifies exactly the units that can never load.
//!
//! ## Fresh Identities
//!
//! Every registration is named `<namespace>.<gadget>@<random hash>`.
//! ResourceLoader ignores a second registration of a known name, so a
//! content-derived or fixed name would leave a reloaded dev page running the
//! previous build.
//!
//! ## Generated Code Is ES5
//!
//! Guards, registrations and the `loadLazily` helper use `function`
//! expressions and `indexOf` only. Whatever the bundler emits for the gadget
//! itself is its own business.

pub mod bundle;
pub mod config;
pub mod definition;
pub mod emit;
pub mod guard;
pub mod inputs;
pub mod js;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod payload;
pub mod project;
pub mod schedule;
pub mod select;
pub mod source;
pub mod transform;
pub mod types;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;
