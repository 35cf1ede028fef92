use std::{fs::File, io::Read};

use smc_llc::DisplayOpts;

pub fn file_to_packet(fname: &str) -> Vec<u8> {
    // The test is executed under the crate root directory.
    let mut program_path = std::env::current_dir().unwrap();
    program_path.push("tests");
    program_path.push("packet_examples");
    program_path.push(fname);

    let mut file = File::open(program_path).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    let content = content.trim();
    assert!(content.len() % 2 == 0, "odd number of hex digits in {}", fname);

    (0..content.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&content[i..i + 2], 16).unwrap())
        .collect()
}

#[allow(dead_code)]
pub fn all_opts() -> DisplayOpts {
    DisplayOpts {
        show_grh: true,
        show_bth: true,
        show_other: true,
        show_reserved: true,
        show_hex: true,
    }
}
