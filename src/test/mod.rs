
/// Routes `log` output through the test harness. Safe to call from every test.
pub(crate) fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());
}
