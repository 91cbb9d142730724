pub mod nifti_io;
