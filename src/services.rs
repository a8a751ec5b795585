//! Service naming for well-known ports.
//!
//! Maps port numbers to the service most likely listening there, for
//! labeling port-scan results. Deliberately small: the table covers the
//! default probe set plus services commonly seen on LAN hosts.

/// Look up the probable service name for a port.
pub fn service_name(port: u16) -> Option<&'static str> {
    let name = match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "dns",
        80 => "http",
        110 => "pop3",
        135 => "msrpc",
        139 => "netbios-ssn",
        143 => "imap",
        443 => "https",
        445 => "microsoft-ds",
        515 => "printer",
        548 => "afp",
        554 => "rtsp",
        631 => "ipp",
        1883 => "mqtt",
        3306 => "mysql",
        3389 => "rdp",
        5000 => "upnp",
        5432 => "postgresql",
        5900 => "vnc",
        6379 => "redis",
        8000 | 8008 | 8081 | 8888 => "http-alt",
        8080 => "http-proxy",
        8443 => "https-alt",
        9100 => "jetdirect",
        _ => return None,
    };
    Some(name)
}

/// A display label for the service on a port, `"unknown"` if unrecognized.
pub fn service_label(port: u16) -> &'static str {
    service_name(port).unwrap_or("unknown")
}
