//! # coursekit
//!
//! Course-administration helpers for instructors: groups downloaded student
//! submission files into one folder per student, based on the
//! `<handle>_<rest-of-filename>` naming convention the LMS uses for bulk
//! downloads.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// For grouping downloaded submission batches by student handle
pub mod submissions;
