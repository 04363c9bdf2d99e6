use bubblewall::config::Config;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::default().eval_args(&mut std::env::args());

    bubblewall::window::winit_main(cfg)
}
