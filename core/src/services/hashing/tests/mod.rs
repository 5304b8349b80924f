mod otp_hasher_tests;
