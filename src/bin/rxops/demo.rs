//! The eight operator demos. Each one asks for its input, then returns the
//! pipeline to run, already rendered to display strings.

use std::{fmt, str::FromStr};

use anyhow::Result;
use rxops::prelude::*;

use crate::prompt::{letters, numbers, parse_number, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
  Map,
  Filter,
  MergeMap,
  ConcatMap,
  Merge,
  Concat,
  Zip,
  Reduce,
}

pub const OPERATOR_NAMES: &str = "map, filter, mergeMap, concatMap, merge, concat, zip, reduce";

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unknown operator {:?}! Try one of: {OPERATOR_NAMES}.", self.0)
  }
}

impl FromStr for Operator {
  type Err = UnknownOperator;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "map" => Ok(Self::Map),
      "filter" => Ok(Self::Filter),
      "mergemap" | "flatmap" => Ok(Self::MergeMap),
      "concatmap" => Ok(Self::ConcatMap),
      "merge" => Ok(Self::Merge),
      "concat" => Ok(Self::Concat),
      "zip" => Ok(Self::Zip),
      "reduce" => Ok(Self::Reduce),
      _ => Err(UnknownOperator(s.to_string())),
    }
  }
}

impl Operator {
  /// Label printed in front of every value.
  pub fn label(self) -> &'static str {
    match self {
      Self::Map => "map",
      Self::Filter => "filter",
      Self::MergeMap => "mergeMap",
      Self::ConcatMap => "concatMap",
      Self::Merge => "merge",
      Self::Concat => "concat",
      Self::Zip => "zip",
      Self::Reduce => "reduce",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::Map => "Multiply all numbers by a specific number.",
      Self::Filter => "Keep only numbers greater than a certain value.",
      Self::MergeMap => "For each letter, add '1' and '2' asynchronously.",
      Self::ConcatMap => "For each letter, add '1' and '2' in order.",
      Self::Merge => "Merge two number streams with different speeds.",
      Self::Concat => "Emit numbers from the first list, then from the second list.",
      Self::Zip => "Combine letters with numbers by order.",
      Self::Reduce => "Add all the numbers together.",
    }
  }

  pub fn completion_message(self) -> &'static str {
    match self {
      Self::Map => "All numbers multiplied successfully.",
      Self::Filter => "Filtering completed.",
      Self::MergeMap => "mergeMap operation completed.",
      Self::ConcatMap => "concatMap finished successfully.",
      Self::Merge => "merge operation completed.",
      Self::Concat => "concat operation completed.",
      Self::Zip => "zip operation completed.",
      Self::Reduce => "reduce operation completed.",
    }
  }
}

const NUMBERS_QUESTION: &str = "Enter numbers separated by commas (e.g. 1,2,3,4,5): ";

/// Prompts for the demo's input and builds its pipeline.
pub fn build(operator: Operator, prompt: &mut Prompt, scheduler: &LocalScheduler) -> Result<Observable<String>> {
  let pipeline = match operator {
    Operator::Map => {
      let input = prompt.ask(NUMBERS_QUESTION)?;
      let factor = parse_number(prompt.ask("Enter the multiply factor: ")?.trim());
      multiply(numbers(&input), factor)
    }
    Operator::Filter => {
      let input = prompt.ask(NUMBERS_QUESTION)?;
      let limit = parse_number(prompt.ask("Enter the minimum number to keep: ")?.trim());
      greater_than(numbers(&input), limit)
    }
    Operator::MergeMap => {
      let input = prompt.ask("Enter letters separated by commas (e.g. A,B): ")?;
      suffix_pairs_merged(letters(&input), scheduler)
    }
    Operator::ConcatMap => {
      let input = prompt.ask("Enter letters separated by commas (e.g. A,B): ")?;
      suffix_pairs_in_order(letters(&input), scheduler)
    }
    Operator::Merge => two_speeds(scheduler),
    Operator::Concat => {
      let first = prompt.ask("Enter first set of numbers (e.g. 1,2,3): ")?;
      let second = prompt.ask("Enter second set of numbers (e.g. 4,5): ")?;
      numbers(&first).concat(&numbers(&second)).map(|v| v.to_string())
    }
    Operator::Zip => {
      let input = prompt.ask("Enter letters (e.g. A,B,C): ")?;
      let nums = prompt.ask("Enter numbers (e.g. 1,2,3): ")?;
      letters(&input)
        .zip(&numbers(&nums))
        .map(|(letter, n)| format!("[{letter}, {n}]"))
    }
    Operator::Reduce => {
      let input = prompt.ask(NUMBERS_QUESTION)?;
      numbers(&input).reduce(0.0, |acc, v| acc + v).map(|v| v.to_string())
    }
  };
  Ok(pipeline)
}

fn multiply(numbers: Observable<f64>, factor: Result<f64, RxError>) -> Observable<String> {
  numbers
    .try_map(move |x| factor.clone().map(|f| x * f))
    .map(|v| v.to_string())
}

fn greater_than(numbers: Observable<f64>, limit: Result<f64, RxError>) -> Observable<String> {
  numbers
    .try_filter(move |x| limit.clone().map(|limit| *x > limit))
    .map(|v| v.to_string())
}

fn suffix_pair(letter: &str) -> Observable<String> {
  Observable::from_iter([format!("{letter}1"), format!("{letter}2")])
}

fn suffix_pairs_merged(letters: Observable<String>, scheduler: &LocalScheduler) -> Observable<String> {
  let scheduler = scheduler.clone();
  letters.merge_map(move |x| {
    let ms = if x == "A" { 300 } else { 100 };
    suffix_pair(&x).delay(Duration::from_millis(ms), &scheduler)
  })
}

fn suffix_pairs_in_order(letters: Observable<String>, scheduler: &LocalScheduler) -> Observable<String> {
  let scheduler = scheduler.clone();
  letters.concat_map(move |x| suffix_pair(&x).delay(Duration::from_millis(200), &scheduler))
}

fn two_speeds(scheduler: &LocalScheduler) -> Observable<String> {
  let a = Observable::interval(Duration::from_millis(300), scheduler)
    .take(3)
    .map(|i| format!("A{i}"));
  let b = Observable::interval(Duration::from_millis(200), scheduler)
    .take(3)
    .map(|i| format!("B{i}"));
  merge(vec![a, b])
}
