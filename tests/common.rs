#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub const SCHEDULE_CSV: &str = "\
Aika,Paikka,Aktiviteetti,Kuvaus
09.00 - 09.30,Sali A,Avaus,Tervetuloa
09.30 - 10.00,,Vapaa,
10.00 - 10.15,,Vapaa,
10.15 - 11.00,Sali B,Työpaja,\"Piirrä, maalaa\"
Lounas,,Lounas,
11.00 - 11.30,,Vapaa,
";

pub const SUPPORTERS_CSV: &str = "\
Taho:,Yhteyshenkilö:,Yhteyshenkilö meiltä:,Status:,Nettisivu:
Luova Club,Maija,Verneri,Mukana,https://luova.club
Gmail Org,Pekka,Verneri,Mukana,gmail.com
Pending Org,Liisa,Verneri,Kysytty,https://pending.fi
No Site,Ville,Verneri,Mukana,
Bare Domain,Anna,Verneri,Mukana,example.org
";

pub fn sf() -> Command {
    cargo_bin_cmd!("sitefeed")
}

/// Fresh scratch directory inside the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("sitefeed_test_{name}"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Write `content` to `dir/name` and return the path as String
pub fn write_file(dir: &PathBuf, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path.to_string_lossy().to_string()
}

/// Global arguments pointing config and run log inside `dir`,
/// so tests never touch the user's ~/.sitefeed
pub fn isolated(dir: &PathBuf) -> Vec<String> {
    vec![
        "--config".to_string(),
        dir.join("sitefeed.conf").to_string_lossy().to_string(),
        "--db".to_string(),
        dir.join("sitefeed.sqlite").to_string_lossy().to_string(),
    ]
}

/// One canned HTTP response
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

pub fn reply(status: u16, body: &str) -> Reply {
    Reply {
        status,
        body: body.as_bytes().to_vec(),
    }
}

/// Serve `replies` in order on a local port, one per connection.
/// Each request arrives on the channel as "<request line>\n<body>"
/// before its reply is written.
pub fn fake_server(replies: Vec<Reply>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let _ = tx.send(read_request(&stream));
            write_reply(stream, &reply);
        }
    });

    (base, rx)
}

fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok();

    let mut length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok();
    format!("{}\n{}", request_line.trim_end(), String::from_utf8_lossy(&body))
}

fn write_reply(mut stream: TcpStream, reply: &Reply) {
    let head = format!(
        "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reply.body.len()
    );
    stream.write_all(head.as_bytes()).ok();
    stream.write_all(&reply.body).ok();
    stream.flush().ok();
}
