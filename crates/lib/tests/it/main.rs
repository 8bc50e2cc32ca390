/*! Integration tests for digmap.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - path_tests: dotted-path resolution end to end (dig, dig_get, dug)
 * - merge_tests: the three union variants and their ownership semantics
 * - attr_tests: attribute-view wrapper construction, access, and serialization
 * - project_tests: export/original projections over mixed structures
 * - error_tests: the crate-level error wrapper and its predicate helpers
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("digmap=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod attr_tests;
mod error_tests;
mod helpers;
mod project_tests;
