//! JRE discovery and the JRE classpath container for kepler.
//!
//! [`JreInstallation`] locates a JRE/JDK (explicit root, `JAVA_HOME`, or
//! `java` on `PATH`) and enumerates its runtime library jars.
//! [`JreContainerResolver`] plugs into `kepler-classpath`'s container
//! registry and turns `JRE_CONTAINER` entries into the job's boot classpath.

mod container;
mod discovery;

pub use container::{JreContainerResolver, JRE_CONTAINER, JRE_HOME_ARGUMENT};
pub use discovery::{JreDiscoveryError, JreInstallation};
