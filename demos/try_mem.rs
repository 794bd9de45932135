use clap::Parser;
use fitalloc::{BlockAllocator, BlockInfo, Config, DEFAULT_POOL_SIZE, Strategy, strategy_from_name};

/// Runs a short allocate/release script against a fresh pool and prints the
/// resulting layout. Each strategy should leave a different layout behind.
#[derive(Parser)]
struct Args {
  /// Placement strategy: first, best, worst or next.
  #[arg(default_value = "first", env = "FITALLOC_STRATEGY", value_parser = parse_strategy)]
  strategy: Strategy,

  /// Pool size in bytes.
  #[arg(long, default_value_t = DEFAULT_POOL_SIZE, env = "FITALLOC_SIZE")]
  size: usize,

  /// Print the layout and status as JSON.
  #[arg(long)]
  json: bool,
}

fn parse_strategy(name: &str) -> Result<Strategy, String> {
  strategy_from_name(name).ok_or_else(|| format!("unknown strategy `{name}`"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let args = Args::parse();
  let config = Config::builder()
    .strategy(args.strategy)
    .size(args.size)
    .build();

  let mut allocator = BlockAllocator::from_config(&config)?;

  // a..e as in the classic exercise: punch a hole, partly refill it, then
  // free the first block and place a small request.
  let a = allocator.allocate(100)?;
  let b = allocator.allocate(100)?;
  let c = allocator.allocate(100)?;
  allocator.release(b)?;
  let d = allocator.allocate(50)?;
  allocator.release(a)?;
  let e = allocator.allocate(25)?;

  if args.json {
    let blocks: Vec<BlockInfo> = allocator.blocks().collect();
    let report = serde_json::json!({
      "strategy": config.strategy,
      "blocks": blocks,
      "status": allocator.status(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  if let Some(pool) = allocator.pool_handle() {
    for (name, offset) in [("c", c), ("d", d), ("e", e)] {
      println!("{} = {:?} (offset {:#x})", name, pool.address_of(offset), offset);
    }
    println!();
  }

  println!("{}", allocator);
  println!("{}", allocator.status());

  Ok(())
}
