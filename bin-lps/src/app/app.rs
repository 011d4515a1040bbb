use log::info;
use clap::{Parser, Subcommand};
use lina::util::measure;

use super::cmd::{poisson, qr, solve};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Cmd
}

#[derive(Subcommand, Debug)]
#[clap(rename_all = "lower")]
pub enum Cmd {
    Qr(qr::Args),
    Solve(solve::Args),
    Poisson(poisson::Args),
}

impl CliArgs {
    fn log_level(&self) -> log::LevelFilter {
        use log::LevelFilter::*;
        let level = match &self.command {
            Cmd::Qr(args)      => args.log,
            Cmd::Solve(args)   => args.log,
            Cmd::Poisson(args) => args.log,
        };
        match level {
            1 => Info,
            2 => Debug,
            3 => Trace,
            _ => Off,
        }
    }
}

pub struct App {
    pub args: CliArgs
}

impl App {
    pub fn new() -> Self {
        let args = CliArgs::parse();
        App { args }
    }

    pub fn run(&self) -> Result<String, Box<dyn std::error::Error>> {
        self.init_logger();

        info!("args: {:?}", self.args);

        let (res, time) = measure(||
            self.dispatch()
        );

        info!("time: {:?}", time);

        res
    }

    fn init_logger(&self) {
        let l = self.args.log_level();
        lina::util::log::init_simple_logger(l).unwrap()
    }

    fn dispatch(&self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.args.command {
            Cmd::Qr(args)      => qr::dispatch(args),
            Cmd::Solve(args)   => solve::dispatch(args),
            Cmd::Poisson(args) => poisson::dispatch(args),
        }
    }
}
