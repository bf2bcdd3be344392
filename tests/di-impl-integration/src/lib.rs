//! 集中测试工程占位 crate，测试见 `tests/` 目录
