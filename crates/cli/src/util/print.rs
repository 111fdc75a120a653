// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use colored::Colorize;

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn info(message: &str) {
    println!("{message}");
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red());
}
