//! End-to-end suite: server and client tables joined by the loopback
//! transport, negotiated through their own signaling callbacks.

#[cfg(test)]
mod harness;

#[cfg(test)]
mod anchors;

#[cfg(test)]
mod lifecycle;

#[cfg(test)]
mod qr;

#[cfg(test)]
mod streaming;
