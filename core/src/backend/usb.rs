//! USB bulk-transfer output sink.
//!
//! Grounded on `ppa6::Printer::open`/`ppa6::usb::UsbBackend::open`: same
//! endpoint-descriptor walk and `set_auto_detach_kernel_driver` dance,
//! generalized away from the PeriPage A6's fixed vendor/product ID pair.

use std::time::Duration;

use rusb::{Context, DeviceHandle, Direction, TransferType, UsbContext};
use thiserror::Error;

use crate::sink::OutputSink;

#[derive(Debug, Error)]
pub enum UsbError {
	#[error("USB problem")]
	Usb(#[from] rusb::Error),

	#[error("failed to claim the USB interface")]
	Claim(#[source] rusb::Error),

	#[error("no printer matching vendor={vendor:#06x} product={product:#06x} found")]
	NotFound { vendor: u16, product: u16 },
}

/// A USB bulk-endpoint printer sink. Write timeout defaults to 30s, the
/// same value `ppa6::Printer::print` uses for its bulk writes.
pub struct UsbSink {
	handle: DeviceHandle<Context>,
	epout: u8,
	epin: u8,
	timeout: Duration,
}

impl UsbSink {
	pub fn find(vendor_id: u16, product_id: u16) -> Result<Self, UsbError> {
		let ctx = Context::new()?;
		let dev = ctx
			.devices()?
			.iter()
			.find(|dev| {
				let Ok(desc) = dev.device_descriptor() else {
					log::warn!("cannot read device descriptor for {dev:?}");
					return false;
				};
				desc.vendor_id() == vendor_id && desc.product_id() == product_id
			})
			.ok_or(UsbError::NotFound { vendor: vendor_id, product: product_id })?;
		Self::open(dev.open()?)
	}

	pub fn open(handle: DeviceHandle<Context>) -> Result<Self, UsbError> {
		let dev = handle.device();
		let _ = handle.set_auto_detach_kernel_driver(true);

		let dd = dev.device_descriptor()?;
		log::trace!("USB device descriptor = {dd:#?}");

		let cd = dev.config_descriptor(0)?;
		let int = cd.interfaces().next().ok_or(UsbError::Claim(rusb::Error::NotFound))?;
		let id = int.descriptors().next().ok_or(UsbError::Claim(rusb::Error::NotFound))?;

		let mut endps = id.endpoint_descriptors();
		let mut epout = None;
		let mut epin = None;
		for ep in &mut endps {
			match ep.direction() {
				Direction::Out if ep.transfer_type() == TransferType::Bulk => epout = Some(ep.address()),
				Direction::In if ep.transfer_type() == TransferType::Bulk => epin = Some(ep.address()),
				_ => {}
			}
		}
		let epout = epout.ok_or(UsbError::Claim(rusb::Error::NotFound))?;
		let epin = epin.unwrap_or(0x81);

		handle.claim_interface(0).map_err(UsbError::Claim)?;

		Ok(UsbSink { handle, epout, epin, timeout: Duration::from_secs(30) })
	}

	pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize, UsbError> {
		Ok(self.handle.read_bulk(self.epin, buf, self.timeout)?)
	}
}

impl Drop for UsbSink {
	fn drop(&mut self) {
		if let Err(e) = self.handle.release_interface(0) {
			log::error!("failed to release USB interface: {e}");
		}
	}
}

impl OutputSink for UsbSink {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
		self.handle
			.write_bulk(self.epout, buf, self.timeout)
			.map(|_| ())
			.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
	}
}
