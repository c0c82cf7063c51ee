//! Bootstrapping of base languages: regenerating the artifacts of a language definition when
//! they are out of date, and publishing the resulting profile.

pub mod conf;
pub mod err;
pub mod layout;
pub mod registry;
pub mod services;

pub mod aterm;
pub mod command;
pub mod orchestrate;

pub use aterm::AtermServices;
pub use command::CommandGenerator;
pub use conf::Conf;
pub use err::*;
pub use layout::{Freshness, PluginLayout, freshness, language_name};
pub use orchestrate::Orchestrator;
pub use registry::{BaseLanguage, Registry};
pub use services::{Generated, Generator, TermParser, TermPrinter};

/// The orchestrator the command line uses: an external generator and ATerm modules.
pub type DefaultOrchestrator = Orchestrator<CommandGenerator, AtermServices, AtermServices>;

impl DefaultOrchestrator {
    pub fn from_conf(conf: Conf) -> Self {
        let generator = CommandGenerator::from(&conf.generator);
        Orchestrator::new(conf, generator, AtermServices::default(), AtermServices::default())
    }
}

#[cfg(test)]
mod tests;
