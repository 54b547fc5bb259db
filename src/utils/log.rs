use log::LevelFilter;

pub struct Logger;

impl Logger {
    pub fn init(level: LevelFilter) {
        let mut builder: env_logger::Builder = colog::default_builder();
        builder.filter_level(level);
        // keep the webdriver and http stacks quiet unless asked for
        if level < LevelFilter::Trace {
            for noisy in ["hyper", "hyper_util", "reqwest", "fantoccini", "html5ever", "selectors"] {
                builder.filter_module(noisy, LevelFilter::Warn);
            }
        }
        builder.init();
    }
}
