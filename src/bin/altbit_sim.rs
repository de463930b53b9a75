//! 交替比特协议仿真
//!
//! A 向 B 单向发送应用消息，信道按给定概率丢包/损坏，运行结束后输出统计。

use altbit_rs::net::{EmulatorConfig, NetWorld, Network};
use altbit_rs::sim::Simulator;
use altbit_rs::viz::VizLogger;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "altbit-sim", about = "交替比特（停等 ARQ）协议仿真：A -> B 单向传输")]
struct Args {
    /// 从 JSON 文件加载配置；命令行参数覆盖文件中的值
    #[arg(long)]
    config: Option<PathBuf>,

    /// 应用层产生的消息总数
    #[arg(long)]
    messages: Option<u64>,

    /// 丢包概率 [0, 1]；为 1 时必须同时给出 --until
    #[arg(long)]
    loss: Option<f64>,

    /// 损坏概率 [0, 1]；为 1 时必须同时给出 --until
    #[arg(long)]
    corrupt: Option<f64>,

    /// 消息平均到达间隔（时间单位）
    #[arg(long)]
    lambda: Option<f64>,

    /// 重传定时器时长（时间单位）
    #[arg(long)]
    rtt: Option<f64>,

    /// 单程时延下限（时间单位）
    #[arg(long)]
    min_delay: Option<f64>,

    /// 单程时延上限（时间单位）
    #[arg(long)]
    max_delay: Option<f64>,

    /// 随机数种子
    #[arg(long)]
    seed: Option<u64>,

    /// 仿真截止时间（时间单位）；不填则运行到没有事件为止
    #[arg(long)]
    until: Option<f64>,

    /// 输出可视化 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,

    /// 输出汇总 JSON 文件
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn build_config(&self) -> Result<EmulatorConfig, altbit_rs::net::ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => EmulatorConfig::load(path)?,
            None => EmulatorConfig::default(),
        };
        if let Some(v) = self.messages {
            cfg.messages = v;
        }
        if let Some(v) = self.loss {
            cfg.loss_prob = v;
        }
        if let Some(v) = self.corrupt {
            cfg.corrupt_prob = v;
        }
        if let Some(v) = self.lambda {
            cfg.lambda = v;
        }
        if let Some(v) = self.rtt {
            cfg.rtt = v;
        }
        if let Some(v) = self.min_delay {
            cfg.min_delay = v;
        }
        if let Some(v) = self.max_delay {
            cfg.max_delay = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if self.until.is_some() {
            cfg.until = self.until;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let cfg = match args.build_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    let mut sim = Simulator::default();
    let mut world = NetWorld::new(Network::lossy(cfg));
    if args.viz_json.is_some() {
        world.net.viz = Some(VizLogger::default());
    }

    world.run(&mut sim);

    if let Some(path) = &args.viz_json {
        if let Some(v) = world.net.viz.take() {
            let json = serde_json::to_string_pretty(&v.events).expect("serialize viz events");
            fs::write(path, json).expect("write viz json");
            eprintln!("wrote viz events to {}", path.display());
        }
    }

    let s = world.net.summary(&sim);
    println!(
        "done @ {:.3}\n  A: accepted={}, window_full={}, acks_received={}, new_acks={}, duplicate_acks={}, corrupted_acks={}, packets_resent={}\n  B: packets_received={}, duplicates={}, corrupted={}, acks_sent={}\n  net: to_layer3={}, lost={}, corrupted={}, delivered={}, timeouts={}, timer_misuse={}, invariant_violations={}, in_order={}",
        s.end_time,
        s.accepted,
        s.sender.window_full,
        s.sender.acks_received,
        s.sender.new_acks,
        s.sender.duplicate_acks,
        s.sender.corrupted_acks,
        s.sender.packets_resent,
        s.receiver.packets_received,
        s.receiver.duplicates,
        s.receiver.corrupted,
        s.receiver.acks_sent,
        s.net.to_layer3,
        s.net.lost,
        s.net.corrupted,
        s.net.delivered,
        s.net.timeouts,
        s.net.timer_misuse,
        s.net.invariant_violations,
        s.in_order,
    );

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&s).expect("serialize summary");
        fs::write(path, json).expect("write summary json");
    }
}
