#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod tree;

/// Routes `log` output through the test harness. Safe to call from every test.
fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());
}
