#![cfg(test)]

mod probes;
