use tickerone_symbols::models::symbol::Market;
use tickerone_symbols::util;

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    // 默认检查 extension/stocks.json，也可以传入其他路径
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(util::default_output_path);

    if !path.exists() {
        eprintln!("{} 不存在，请先运行 'cargo run --bin build_stocks'", path.display());
        return ExitCode::FAILURE;
    }

    let symbols = match util::read_symbols_json(&path) {
        Ok(symbols) => symbols,
        Err(e) => {
            eprintln!("无法解析 {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let sh = symbols.iter().filter(|s| s.market == Market::Sh).count();
    println!("{}: 共 {} 支, 沪市 {} 支, 深市 {} 支", path.display(), symbols.len(), sh, symbols.len() - sh);

    let violations = util::validate_symbols(&symbols);
    if violations.is_empty() {
        println!("检查通过");
        return ExitCode::SUCCESS;
    }

    for violation in &violations {
        eprintln!("{}", violation);
    }
    eprintln!("发现 {} 处问题", violations.len());
    ExitCode::FAILURE
}
