/// Global flags available before or after subcommands.
#[derive(Clone, Debug, Default)]
pub struct GlobalFlags {
    pub user: Option<String>,
    pub db: Option<String>,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
}
