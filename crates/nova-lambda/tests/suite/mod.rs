mod checker;
mod existential;
mod logging;
mod parameters;
mod support;
