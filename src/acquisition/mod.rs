mod acquisition;

pub use acquisition::Acquisition;

#[cfg(test)]
mod test;
