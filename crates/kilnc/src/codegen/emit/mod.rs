//! Code generation for top-level items.
//!
//! Declarations (`extern` prototypes and the prototype half of a
//! definition) become module functions with an external or internal
//! linkage. Definitions add a body shaped as:
//!
//! ```text
//! entry:   parameter slots, return slot
//! ...      lowered body; every `return` stores then branches to `exit`
//! exit:    load the return slot (if any) and `ret`
//! ```
//!
//! A definition is verified on its own as soon as it is complete and
//! optimized with the configured function pipeline when it passes.

pub mod functions;
