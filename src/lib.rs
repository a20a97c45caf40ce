#![crate_name = "alanrun"]

#[macro_use]
extern crate lazy_static;

pub mod acode;
pub mod command;
pub mod config;
pub mod dictionary;
pub mod disambiguate;
pub mod dispatch;
pub mod error;
pub mod exits;
pub mod header;
pub mod interpret;
pub mod memory;
pub mod multiple;
pub mod output;
pub mod parameter;
pub mod reference;
pub mod resolve;
pub mod restriction;
pub mod runtime;
pub mod scan;
pub mod story;
pub mod syntax;
pub mod testing;
pub mod words;
pub mod world;

#[cfg(test)]
mod disambiguate_tests;
#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod multiple_tests;
#[cfg(test)]
mod syntax_tests;

/*
Command pipeline, per player command

  scan          words and literals
  syntax        match the verb's syntax tree, collect word spans per position
  reference     ALL / ALL EXCEPT / THEM / "a and b" inside one position
  resolve       candidates for each span, disambiguated
  multiple      ALL feasibility trial, exceptions, explicit lists
  restriction   syntax class restrictions
  dispatch      alternatives by scope, three passes, replay per target
  memory        pronouns and the multiple set for the next command
*/
