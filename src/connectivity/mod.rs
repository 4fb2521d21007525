use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether the network is reachable right now.
///
/// Implementations inspect local state only and never wait on the network.
pub trait ConnectivityProbe {
    fn is_reachable(&self) -> bool;
}

/// Asks the OS routing table whether any route leads to `target`.
///
/// Connecting an unbound UDP socket performs the route lookup without
/// sending a datagram.
pub struct RouteProbe {
    target: Option<SocketAddr>,
}

impl RouteProbe {
    pub fn new(target: &str) -> Self {
        let target = target.parse::<SocketAddr>().ok().or_else(|| {
            target
                .parse::<IpAddr>()
                .ok()
                .map(|ip| SocketAddr::new(ip, 53))
        });
        if target.is_none() {
            tracing::warn!("Connectivity probe address is not a socket address, probe will report offline");
        }
        Self { target }
    }
}

impl ConnectivityProbe for RouteProbe {
    fn is_reachable(&self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };

        match UdpSocket::bind(bind_addr).and_then(|socket| socket.connect(target)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("No route to {}: {}", target, e);
                false
            }
        }
    }
}

/// A probe whose answer is set by hand, for `--offline` and tests.
#[derive(Debug)]
pub struct StaticProbe {
    reachable: AtomicBool,
}

impl StaticProbe {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for StaticProbe {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
