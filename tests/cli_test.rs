use assert_cmd::prelude::*;
use std::process::Command;
use tempfile;

type STDRESULT = Result<(),Box<dyn std::error::Error>>;

fn round_trip(subcommand_pair: (&str,&str), extra_args: &[&str], payload: &[u8]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("plain.bin");
    let enc_path = temp_dir.path().join("cipher.bin");
    let out_path = temp_dir.path().join("restored.bin");
    std::fs::write(&in_path,payload)?;

    let mut encode_cmd = Command::cargo_bin("magicoder")?;
    encode_cmd.arg(subcommand_pair.0)
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&enc_path)
        .args(extra_args)
        .assert()
        .success();

    let mut decode_cmd = Command::cargo_bin("magicoder")?;
    decode_cmd.arg(subcommand_pair.1)
        .arg("-i").arg(&enc_path)
        .arg("-o").arg(&out_path)
        .args(extra_args)
        .assert()
        .success();

    let restored = std::fs::read(&out_path)?;
    assert_eq!(restored,payload);
    Ok(())
}

#[test]
fn encode_decode_round_trip_no_preamble() -> STDRESULT {
    round_trip(("encode","decode"),&[],b"Hello, World!")
}

#[test]
fn encode_decode_round_trip_with_key() -> STDRESULT {
    round_trip(("encode","decode"),&["-k","secret"],b"Hello, World!")
}

#[test]
fn encode_decode_round_trip_with_key_pin_iv() -> STDRESULT {
    round_trip(("encode","decode"),&["-k","k","-p","1234","--iv-length","8"],b"a longer payload to exercise the preamble plus body")
}

#[test]
fn lzw_round_trip_with_key() -> STDRESULT {
    let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    round_trip(("lzw-encode","lzw-decode"),&["-k","k"],&payload)
}

#[test]
fn decode_with_wrong_key_produces_empty_output() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("plain.bin");
    let enc_path = temp_dir.path().join("cipher.bin");
    let out_path = temp_dir.path().join("restored.bin");
    std::fs::write(&in_path,b"Hello, World!")?;

    let mut encode_cmd = Command::cargo_bin("magicoder")?;
    encode_cmd.arg("encode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&enc_path)
        .arg("-k").arg("secret")
        .assert()
        .success();

    let mut decode_cmd = Command::cargo_bin("magicoder")?;
    decode_cmd.arg("decode")
        .arg("-i").arg(&enc_path)
        .arg("-o").arg(&out_path)
        .arg("-k").arg("Secret")
        .assert()
        .success();

    let restored = std::fs::read(&out_path)?;
    assert!(restored.is_empty());
    Ok(())
}
