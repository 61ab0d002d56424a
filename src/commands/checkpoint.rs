use crate::checkpoint::format_timestamp;
use crate::config::Config;

pub(crate) fn cmd_checkpoint(config: &Config) -> anyhow::Result<()> {
    let store = config.checkpoint_store();
    let since = store.load();
    let state = if store.path().exists() {
        "saved"
    } else {
        "default, no checkpoint saved yet"
    };
    println!("{}", store.path().display());
    println!("{} ({state})", format_timestamp(&since));
    Ok(())
}
