use tidewater::{SceneConfig, TidewaterApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu=warn,naga=warn"),
    )
    .init();

    TidewaterApp::new(SceneConfig::default())?.run()
}
