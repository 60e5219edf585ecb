#[cfg(test)]
pub const POST_DATA: &str = "---
Title: Getting Started with Rust
Published Date: 2023-11-05
Last Update: 2024-01-10
Tags: rust, tutorial
---
## Intro
Rust is a systems language.

It is fast.
## Installing the toolchain
Run the installer:
```bash
rustup update
```
## Writing code
Some text.
";

#[cfg(test)]
pub const SECOND_POST_DATA: &str = "---
Title: Async in Practice
Published Date: 2024-03-01
Last Update:
Tags: rust, async
---
## Intro
Futures do nothing unless polled.
## Executors
Pick one.
## Pitfalls
Do not block.
";

#[cfg(test)]
pub const POST_WITHOUT_FRONT_MATTER: &str = "# Just a title

## Section
Nothing else.
";
