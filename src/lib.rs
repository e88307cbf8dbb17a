/*
    Membership of words in context-free languages given in Chomsky Normal
    Form, decided with the CYK algorithm
*/

pub mod chart;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;

pub use chart::{algorithm_state_to_string, chart_to_string, is_derived, Chart, ChartErrorType};
pub use grammar::{Alternative, Grammar, GrammarErrorType, Symbol};
